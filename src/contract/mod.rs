//! Contract bindings.
//!
//! # Data Flow
//! ```text
//! address + (explicit ABI | artifact name | nothing)
//!     → abi.rs (explicit / local artifact)  or  explorer.rs (getabi)
//!     → binding.rs (ContractBinding: call / transact)
//!     → blockchain::ChainConnection (eth_call, signing, broadcast)
//! ```

pub mod abi;
pub mod binding;
pub mod explorer;

pub use binding::ContractBinding;
pub use explorer::BlockExplorer;
