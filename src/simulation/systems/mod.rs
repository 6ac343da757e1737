pub mod achievements;
pub mod blocs;
pub mod currency;
pub mod debt;
pub mod demography;
pub mod development;
pub mod diplomacy;
pub mod economy;
pub mod espionage;
pub mod events;
pub mod leaders;
pub mod logging;
pub mod scripted;
pub mod tiers;
pub mod trade;

pub use achievements::*;
pub use blocs::*;
pub use currency::*;
pub use debt::*;
pub use demography::*;
pub use development::*;
pub use diplomacy::*;
pub use economy::*;
pub use espionage::*;
pub use events::*;
pub use leaders::*;
pub use logging::*;
pub use scripted::*;
pub use tiers::*;
pub use trade::*;
