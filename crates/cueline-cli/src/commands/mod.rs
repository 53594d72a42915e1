pub mod mock;
pub mod replay;
pub mod shot;
