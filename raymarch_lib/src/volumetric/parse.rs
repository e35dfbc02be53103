//! `nom` parsers for volume file names and NHDR headers.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alphanumeric1, char, digit1, space0, space1},
    combinator::{all_consuming, map, map_res, rest, value},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    IResult,
};

fn dimension(s: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(s)
}

/// Dimensions and type name from `{X}x{Y}x{Z}_{TYPE}.raw`
pub fn raw_file_name(s: &str) -> IResult<&str, ([usize; 3], &str)> {
    let (s, (x, _, y, _, z)) = tuple((dimension, char('x'), dimension, char('x'), dimension))(s)?;
    let (s, type_name) = delimited(char('_'), alphanumeric1, tag(".raw"))(s)?;

    Ok((s, ([x, y, z], type_name)))
}

/// First line of a NRRD header, returns the format version
pub fn nrrd_magic(s: &str) -> IResult<&str, u32> {
    all_consuming(preceded(
        tag("NRRD"),
        terminated(map_res(digit1, str::parse::<u32>), space0),
    ))(s)
}

/// `key: value` line, the key is lowercase and trimmed
pub fn header_field(s: &str) -> IResult<&str, (String, &str)> {
    let (s, (key, value)) = separated_pair(take_until(":"), tag(":"), preceded(space0, rest))(s)?;
    Ok((s, (key.trim().to_ascii_lowercase(), value.trim_end())))
}

/// `key:=value` line, carries no information needed for rendering
pub fn key_value_pair(s: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_until(":="), tag(":="), rest)(s)
}

/// Whitespace separated unsigned integers
pub fn usize_list(s: &str) -> IResult<&str, Vec<usize>> {
    all_consuming(delimited(
        space0,
        separated_list1(space1, map_res(digit1, str::parse::<usize>)),
        space0,
    ))(s)
}

/// Whitespace separated floats
pub fn float_list(s: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(delimited(space0, separated_list1(space1, double), space0))(s)
}

/// Vector in parentheses, `(1.0,0,0)`
fn direction_vector(s: &str) -> IResult<&str, Vec<f64>> {
    delimited(
        terminated(char('('), space0),
        separated_list1(tuple((space0, char(','), space0)), double),
        preceded(space0, char(')')),
    )(s)
}

/// `space directions` value: vectors, `none` for non-spatial axes
pub fn space_directions(s: &str) -> IResult<&str, Vec<Option<Vec<f64>>>> {
    all_consuming(delimited(
        space0,
        separated_list1(
            space1,
            alt((map(direction_vector, Some), value(None, tag("none")))),
        ),
        space0,
    ))(s)
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn raw_name() {
        let (rest, (dims, type_name)) = raw_file_name("128x64x32_uint8.raw").unwrap();
        assert_eq!(rest, "");
        assert_eq!(dims, [128, 64, 32]);
        assert_eq!(type_name, "uint8");
    }

    #[test]
    fn raw_name_bad() {
        assert!(raw_file_name("128x64_uint8.raw").is_err());
        assert!(raw_file_name("128x64x32-uint8.raw").is_err());
        assert!(raw_file_name("128x64x32_uint8.dat").is_err());
        assert!(raw_file_name("x64x32_uint8.raw").is_err());
    }

    #[test]
    fn magic() {
        assert_eq!(nrrd_magic("NRRD0004"), Ok(("", 4)));
        assert_eq!(nrrd_magic("NRRD0005 "), Ok(("", 5)));
        assert!(nrrd_magic("NHDR0004").is_err());
        assert!(nrrd_magic("NRRD").is_err());
    }

    #[test]
    fn field() {
        let (_, (key, value)) = header_field("Space Directions: (1,0,0) (0,1,0)").unwrap();
        assert_eq!(key, "space directions");
        assert_eq!(value, "(1,0,0) (0,1,0)");

        let (_, (key, value)) = header_field("data file:tooth.raw").unwrap();
        assert_eq!(key, "data file");
        assert_eq!(value, "tooth.raw");

        assert!(header_field("no separator here").is_err());
    }

    #[test]
    fn key_value() {
        let (_, (key, value)) = key_value_pair("modality:=CT").unwrap();
        assert_eq!(key, "modality");
        assert_eq!(value, "CT");
    }

    #[test]
    fn lists() {
        assert_eq!(usize_list("103 94 161"), Ok(("", vec![103, 94, 161])));
        assert!(usize_list("103 9.4 161").is_err());
        assert_eq!(float_list(" 0.5 1 2e1 "), Ok(("", vec![0.5, 1.0, 20.0])));
    }

    #[test]
    fn directions() {
        let (_, dirs) = space_directions("(0.5,0,0) (0, 2 ,0) ( 0,0,1.25 )").unwrap();
        assert_eq!(
            dirs,
            vec![
                Some(vec![0.5, 0.0, 0.0]),
                Some(vec![0.0, 2.0, 0.0]),
                Some(vec![0.0, 0.0, 1.25])
            ]
        );

        let (_, dirs) = space_directions("none (1,0,0) (0,1,0) (0,0,1)").unwrap();
        assert_eq!(dirs.len(), 4);
        assert_eq!(dirs[0], None);

        assert!(space_directions("(1,0,0) (0,1,0) (0,0,1").is_err());
    }
}
