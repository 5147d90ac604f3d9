//! envops - Environment replication and load-balancer rule rollout.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── replicate     # Copy an environment across the fixed repositories
//! │   ├── update_rule   # Repoint a listener rule to a new target group
//! │   ├── completions   # Shell completions
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── config        # Replicator configuration and repository table
//!     ├── constants     # File names, markers, default repositories
//!     ├── git           # Clone/update/commit through a command runner
//!     ├── replicate     # Copy-and-patch of environment directories
//!     ├── pipeline      # Client choice list patching
//!     ├── rules         # Listener rule lookup and repointing
//!     └── elb           # AWS ELBv2 backend (feature `aws`)
//! ```

pub mod cli;
pub mod core;
pub mod error;
