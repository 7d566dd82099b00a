/// What the capture source reported when it opened.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
    /// Nominal frame rate; 0 when the source does not advertise one.
    pub fps: f64,
    pub codec: String,
    /// Credential-free description of the source, suitable for logs.
    pub source: String,
}
