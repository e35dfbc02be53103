use crate::config::Config;

/// Detached NRRD header describing the generated raw file.
/// Spacing is written as axis-aligned `space directions`.
pub fn generate_header(cfg: &Config, data_file: &str) -> String {
    let d = cfg.dims;
    let s = cfg.spacing;
    format!(
        "NRRD0004\n\
         # generated by vol_gen\n\
         type: {}\n\
         dimension: 3\n\
         space: left-posterior-superior\n\
         sizes: {} {} {}\n\
         space directions: ({},0,0) (0,{},0) (0,0,{})\n\
         kinds: domain domain domain\n\
         endian: little\n\
         encoding: raw\n\
         space origin: (0,0,0)\n\
         data file: {}\n",
        cfg.sample_type.name(),
        d.x,
        d.y,
        d.z,
        s.x,
        s.y,
        s.z,
        data_file
    )
}

#[cfg(test)]
mod test {

    use nalgebra::vector;
    use raymarch_lib::volumetric::{DataType, Endianness, NhdrHeader};

    use super::*;
    use crate::{
        config::{GeneratorConfig, SampleType},
        generators::test::config,
    };

    #[test]
    fn header_is_readable() {
        let mut cfg = config(vector![3, 4, 5], GeneratorConfig::Gradient, SampleType::UInt16);
        cfg.spacing = vector![0.5, 1.0, 2.5];

        let text = generate_header(&cfg, &cfg.raw_file_name());
        let header = NhdrHeader::parse(&text).unwrap();

        assert_eq!(header.sizes, [3, 4, 5]);
        assert_eq!(header.spacings, [0.5, 1.0, 2.5]);
        assert_eq!(header.data_type, DataType::UInt16);
        assert_eq!(header.endianness, Endianness::Little);
        assert_eq!(header.data_file.to_str(), Some("3x4x5_uint16.raw"));
    }
}
