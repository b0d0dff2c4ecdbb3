//! Defines application business models.

pub mod case;
pub mod record;
