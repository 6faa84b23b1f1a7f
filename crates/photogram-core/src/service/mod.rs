//! Domain services - orchestration across repositories.

mod sns;

pub use sns::SnsService;
