pub mod help;
pub mod hosts;
pub mod packets;
pub mod sockets;

pub use help::*;
pub use hosts::*;
pub use packets::*;
pub use sockets::*;
