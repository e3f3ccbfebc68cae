//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!        inbound                                   outbound
//!  ┌──────────────┐      ┌───────────────┐      ┌───────────────┐
//!  │ HTTP / CLI   │─────▶│  Application  │─────▶│ KeyValueStore │
//!  └──────────────┘      │ Pricer        │      ├───────────────┤
//!     OddsQuery          │ OddsQuery     │◀─────│  QuoteStream  │
//!                        └───────────────┘      └───────────────┘
//! ```
//!
//! - [`inbound`]: capabilities the application exposes ([`inbound::Pricer`],
//!   [`inbound::OddsQuery`])
//! - [`outbound`]: infrastructure the application depends on
//!   ([`outbound::KeyValueStore`], [`outbound::QuoteStream`])

pub mod inbound;
pub mod outbound;
