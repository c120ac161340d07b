pub mod traits;
pub mod udp;

pub use traits::LightDriver;
pub use udp::WizUdpDriver;
