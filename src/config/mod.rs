pub mod settings;

pub use settings::{SecretSource, Settings, SinkKind};
