pub mod attack;
pub mod collision;
pub mod combat;
pub mod components;
pub mod cooldown;
pub mod drops;
pub mod enemy;
pub mod events;
pub mod intent;
pub mod level_up;
pub mod physics;
pub mod pickups;
pub mod presentation;
pub mod progression;
pub mod projectile;
pub mod rng;
pub mod shield;
pub mod skills;
pub mod stats;
pub mod status;
