// Challenge Draft persistence and HTTP surface. Drafts are created by the
// generation pipeline's auto-save and mutated by the section editor; they
// are never deleted automatically.

pub mod handlers;
pub mod store;
