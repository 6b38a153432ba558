// Two security tiers: public (no auth) and protected (JWT auth required).
pub mod protected;
pub mod public;
