pub mod bar;
pub mod confirmation;
pub mod signals;

pub use bar::*;
pub use confirmation::*;
pub use signals::*;
