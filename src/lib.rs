//! Update contract for game groups: the request payload, its closed value sets,
//! and construction with validation that reports every violated field at once.

pub mod checker;
pub mod config;
pub mod error;
pub mod game_group;

pub use error::{AppError, FieldViolation, Result, ValidationFailure};
pub use game_group::{
    AccessRule, GameGroup, GameGroupUpdatePayload, Modality, UpdateGameGroupRequest,
    ValidationPolicy, Visibility,
};
