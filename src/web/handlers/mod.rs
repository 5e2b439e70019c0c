// One file per API route group.

pub mod guestbook;
pub mod likes;
pub mod newsletter;
pub mod whiteboard;
