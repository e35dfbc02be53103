use std::{sync::Arc, thread::JoinHandle};

use crossbeam::channel::{Receiver, Sender, TrySendError};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};

use super::{IsovalueWindow, RenderOptions, Renderer, ViewMode, ViewParameters};
use crate::{
    camera::ArcballCamera,
    color::RGB,
    error::RenderError,
    transfer_function::TransferLut,
    volumetric::Volume,
};

/// Messages to renderer
///
/// Messages queue up and one is read after frame is done.
/// Only `StartRendering` produces a frame, the rest change state of the next one.
pub enum RendererMessage {
    /// Start rendering
    StartRendering,
    SetViewMode(ViewMode),
    SetIsovalueWindow(IsovalueWindow),
    SetVolumeColor(RGB),
    SetTransferFunction(TransferLut),
    LoadVolume(Box<Volume>),
    /// Shut down, thread will get ready to be joined
    ShutDown,
}

/// Interface for renderers running in different thread
///
/// Must be implemented by renderers that wish to communicate using
/// [`RendererFront`].
pub trait RenderThread {
    /// Get reference to shared framebuffer
    fn get_shared_buffer(&self) -> Arc<Mutex<Vec<u8>>>;

    /// Get reference to camera
    ///
    /// If you obtain write lock, you can change camera position
    fn get_camera(&self) -> Arc<RwLock<ArcballCamera>>;

    /// Spawn thread with renderer
    ///
    /// Renderer waits for messages, does _not_ start rendering.
    fn start(self) -> JoinHandle<()>;

    /// Communication setter
    fn set_communication(&mut self, communication: (Sender<()>, Receiver<RendererMessage>));
}

/// Communicating with renderer
///
/// Can be active or inactive.
pub struct RendererFront {
    handle: Option<JoinHandle<()>>,
    buffer: Option<Arc<Mutex<Vec<u8>>>>,
    camera: Option<Arc<RwLock<ArcballCamera>>>,
    communication_in: (Sender<RendererMessage>, Receiver<RendererMessage>),
    communication_out: (Sender<()>, Receiver<()>),
}

impl RendererFront {
    /// Create inactive front
    pub fn new() -> Self {
        let communication_in = crossbeam::channel::bounded(100); // main -> renderer
        let communication_out = crossbeam::channel::bounded(100); // renderer -> main
        Self {
            handle: None,
            buffer: None,
            camera: None,
            communication_in,
            communication_out,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Getter for sender
    /// Returned struct can be used to send commands to renderer
    pub fn get_sender(&self) -> Sender<RendererMessage> {
        self.communication_in.0.clone()
    }

    /// Send message to renderer
    pub fn send_message(&self, msg: RendererMessage) -> Result<(), RenderError> {
        if !self.is_active() {
            return Err(RenderError::Disconnected);
        }
        self.communication_in
            .0
            .send(msg)
            .map_err(|_| RenderError::Disconnected)
    }

    /// Getter for message receiver
    ///
    /// A message means new frame is ready and shared buffer can be read.
    pub fn get_receiver(&self) -> Receiver<()> {
        self.communication_out.1.clone()
    }

    /// Wait for the next finished frame
    pub fn receive_message(&self) -> Result<(), RenderError> {
        if !self.is_active() {
            return Err(RenderError::Disconnected);
        }
        self.communication_out
            .1
            .recv()
            .map_err(|_| RenderError::Disconnected)
    }

    /// Getter for shared framebuffer
    /// If front is inactive, return `None`
    pub fn get_buffer_handle(&self) -> Option<Arc<Mutex<Vec<u8>>>> {
        self.buffer.as_ref().cloned()
    }

    /// Getter for camera handle
    /// If front is inactive, return `None`
    pub fn get_camera_handle(&self) -> Option<Arc<RwLock<ArcballCamera>>> {
        self.camera.as_ref().cloned()
    }

    /// Start `renderer`
    ///
    /// Front goes into active state.
    /// If front was already active, previous renderer gets shutdown first.
    pub fn start_rendering<R: RenderThread>(&mut self, mut renderer: R) -> Result<(), RenderError> {
        if self.is_active() {
            info!("Shutting down current renderer");
            self.finish()?;
        }

        // leftovers of the previous renderer
        while self.communication_in.1.try_recv().is_ok() {}
        while self.communication_out.1.try_recv().is_ok() {}

        let communication = (
            self.communication_out.0.clone(),
            self.communication_in.1.clone(),
        );
        renderer.set_communication(communication);
        self.buffer = Some(renderer.get_shared_buffer());
        self.camera = Some(renderer.get_camera());
        self.handle = Some(renderer.start()); // waits for StartRendering
        Ok(())
    }

    /// Shut renderer down and join its thread
    ///
    /// Call is blocking until thread is joined.
    /// Front goes into inactive state.
    pub fn finish(&mut self) -> Result<(), RenderError> {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => return Ok(()),
        };
        self.buffer = None;
        self.camera = None;

        self.communication_in
            .0
            .send(RendererMessage::ShutDown)
            .map_err(|_| RenderError::Disconnected)?;
        handle.join().map_err(|_| {
            warn!("Render thread panicked");
            RenderError::Disconnected
        })
    }
}

impl Default for RendererFront {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RendererFront {
    fn drop(&mut self) {
        if self.finish().is_err() {
            warn!("Render thread did not shut down cleanly");
        }
    }
}

/// [`Renderer`] living in its own thread, output is a RGB byte buffer
pub struct ThreadedRenderer {
    volume: Volume,
    lut: TransferLut,
    view: ViewParameters,
    background: RGB,
    renderer: Renderer,
    shared_buffer: Arc<Mutex<Vec<u8>>>,
    camera: Arc<RwLock<ArcballCamera>>,
    communication: (Sender<()>, Receiver<RendererMessage>),
}

impl RenderThread for ThreadedRenderer {
    fn get_shared_buffer(&self) -> Arc<Mutex<Vec<u8>>> {
        self.shared_buffer.clone()
    }

    fn get_camera(&self) -> Arc<RwLock<ArcballCamera>> {
        self.camera.clone()
    }

    fn start(self) -> JoinHandle<()> {
        std::thread::spawn(move || self.render_loop())
    }

    fn set_communication(&mut self, communication: (Sender<()>, Receiver<RendererMessage>)) {
        self.communication = communication;
    }
}

impl ThreadedRenderer {
    pub fn new(
        volume: Volume,
        camera: Arc<RwLock<ArcballCamera>>,
        render_options: RenderOptions,
    ) -> Result<Self, RenderError> {
        let renderer = Renderer::new(render_options)?;
        let (width, height) = render_options.resolution;
        let buffer = Arc::new(Mutex::new(vec![0; width * height * 3]));

        camera.write().change_aspect_from_resolution(width, height);

        // Dummy channels
        // Replaced once started
        let (sender_void, _) = crossbeam::channel::unbounded();
        let never = crossbeam::channel::never();
        let communication = (sender_void, never);

        Ok(Self {
            volume,
            lut: TransferLut::default(),
            view: ViewParameters::default(),
            background: RGB::new(1.0, 1.0, 1.0),
            renderer,
            shared_buffer: buffer,
            camera,
            communication,
        })
    }

    #[must_use]
    pub fn with_view(mut self, view: ViewParameters) -> Self {
        self.view = view;
        self
    }

    #[must_use]
    pub fn with_transfer_function(mut self, lut: TransferLut) -> Self {
        self.lut = lut;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: RGB) -> Self {
        self.background = background;
        self
    }

    fn render_loop(mut self) {
        loop {
            // front dropped its ends
            let msg = match self.communication.1.recv() {
                Ok(msg) => msg,
                Err(_) => break,
            };

            match msg {
                RendererMessage::StartRendering => (),
                RendererMessage::SetViewMode(mode) => {
                    self.view.mode = mode;
                    continue;
                }
                RendererMessage::SetIsovalueWindow(window) => {
                    self.view.window = window;
                    continue;
                }
                RendererMessage::SetVolumeColor(color) => {
                    self.view.volume_color = color;
                    continue;
                }
                RendererMessage::SetTransferFunction(lut) => {
                    self.lut = lut;
                    continue;
                }
                RendererMessage::LoadVolume(volume) => {
                    debug!("New volume {:?}", volume.get_sizes());
                    self.volume = *volume;
                    continue;
                }
                RendererMessage::ShutDown => break,
            }

            {
                let mut buffer = self.shared_buffer.lock();
                let camera = self.camera.read();

                self.renderer.render_to_buffer(
                    camera.perspective(),
                    &self.volume,
                    &self.lut,
                    &self.view,
                    &self.background,
                    &mut buffer[..],
                );
            }

            // Send result, a full queue already signals a fresh buffer
            match self.communication.0.try_send(()) {
                Ok(()) | Err(TrySendError::Full(())) => (),
                Err(TrySendError::Disconnected(())) => break,
            }
        }
        debug!("Render thread finished");
    }
}
