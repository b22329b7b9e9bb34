pub mod external;
pub mod ring;
pub mod vertex;

pub use external::{DrawEvent, DrawLayer, ExternalGeometry, LayerId, Position};
pub use ring::Ring;
pub use vertex::Vertex;
