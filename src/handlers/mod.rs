// HTTP handlers. Every resource route is owner-scoped through the `gs-user`
// header; /health is the only route that ignores identity.
pub mod health;
pub mod resources;
