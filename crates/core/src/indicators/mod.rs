//! Pure indicator math over positional price slices (oldest first).
//!
//! None of these functions fail: insufficient history is reported through sentinel
//! values (0, 50 for RSI, `Trend::Neutral` for Supertrend).

pub mod atr;
pub mod cci;
pub mod crossover;
pub mod rsi;
pub mod sma;
pub mod supertrend;
