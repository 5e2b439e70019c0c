// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "storage/mod.rs"]
pub mod storage;

#[path = "guestbook/guestbook_service.rs"]
pub mod guestbook;

#[path = "newsletter/newsletter_service.rs"]
pub mod newsletter;

#[path = "likes/likes_service.rs"]
pub mod likes;

#[path = "whiteboard/mod.rs"]
pub mod whiteboard;
