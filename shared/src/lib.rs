pub mod protocol;
pub mod entities;
pub mod items;
pub mod skills;
pub mod spells;
pub mod guilds;

pub use protocol::*;
pub use entities::*;
pub use items::*;
pub use skills::*;
pub use spells::*;
pub use guilds::*;
