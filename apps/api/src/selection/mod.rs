// Bullet selection core: quota apportionment and tiered per-category fill.
// Pure functions over pre-normalized entries — nothing here can fail.

pub mod quota;
pub mod selector;

pub use quota::{allocate_quota, CategoryQuota};
pub use selector::{select_bullets, Selection};
