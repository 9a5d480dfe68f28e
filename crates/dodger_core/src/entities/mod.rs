//! Simulation entities: the player, enemies, their weapons and projectiles

pub mod enemy;
pub mod inventory;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod weapon;

pub use enemy::{Awareness, Enemy, EnemyUpdate};
pub use inventory::{Inventory, Slot};
pub use pickup::WeaponPickup;
pub use player::{DashState, Player};
pub use projectile::Projectile;
pub use weapon::{ReloadPolicy, Weapon, WeaponKind, WeaponSpec};
