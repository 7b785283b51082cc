mod catalog;
mod folder;
mod media;
mod settings;
mod user;

pub use catalog::*;
pub use folder::*;
pub use media::*;
pub use settings::*;
pub use user::*;
