//! Capability interface for components attached to a waveform view.

/// What a plugin learns about its host when it is initialized.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HostInfo {
    /// Audio duration, once decoded.
    pub duration: Option<f64>,
    /// Content width in pixels.
    pub total_width: u32,
    /// Visible width in pixels.
    pub container_width: f64,
    /// Visible window as `(start, end)` content fractions.
    pub visible: (f64, f64),
}

/// Lifecycle hooks shared by view components.
///
/// `init` runs when the view becomes ready and again whenever its layout
/// changes; `destroy` must release every subscription the plugin holds.
pub trait Plugin {
    fn name(&self) -> &'static str;
    fn init(&mut self, host: &HostInfo);
    fn destroy(&mut self);
}
