// Adapters layer: concrete implementations of the domain ports.

pub mod prompt;
pub mod storage;
pub mod supabase;

pub use prompt::{FixedConfirm, TerminalConfirm};
pub use storage::LocalStorage;
pub use supabase::SupabaseClient;
