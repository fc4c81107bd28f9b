//! Authentication adapters.
//!
//! Implementations of the `IdentityProvider` port:
//!
//! - `supabase` - Production Supabase Auth implementation
//! - `mock` - Test implementation that doesn't require external services

mod mock;
mod supabase;

pub use mock::MockIdentityProvider;
pub use supabase::SupabaseIdentityProvider;
