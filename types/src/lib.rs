//! Fundamental types for govlens.
//!
//! This crate defines the records shared across every other crate in the
//! workspace: token amounts, timestamps and clocks, governance parameters,
//! proposals (raw and normalized), tallies and validators.

pub mod amount;
pub mod de;
pub mod error;
pub mod params;
pub mod proposal;
pub mod tally;
pub mod time;
pub mod validator;

pub use amount::{Coin, TokenAmount, MICRO_PER_UNIT};
pub use error::TypesError;
pub use params::{GovParams, TallyParams};
pub use proposal::{Proposal, ProposalContent, ProposalStatus, ProposalsPage, RawProposal};
pub use tally::{TallyOutcome, TallyResult, VoteTally};
pub use time::{Clock, SystemClock, Timestamp};
pub use validator::Validator;
