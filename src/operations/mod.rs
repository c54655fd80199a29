mod rim_extrude;

pub use rim_extrude::RimExtrude;
