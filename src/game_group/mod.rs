pub mod game_group_models;
pub mod game_group_dto;

pub use game_group_models::{AccessRule, GameGroup, Modality, UnknownVariant, Visibility};
pub use game_group_dto::{GameGroupUpdatePayload, UpdateGameGroupRequest, ValidationPolicy};
