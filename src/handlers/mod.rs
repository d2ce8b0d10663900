// handlers - two tiers
//
// Public (no session) → Protected (session cookie, role-gated)
pub mod public;
pub mod protected;
