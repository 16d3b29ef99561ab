pub mod deserializers;
pub mod pipeline;
pub mod types;

pub use pipeline::{normalizar_payload, NormalizeOutput};
pub use types::{ParseWarning, Registro, RegistroRaw};
