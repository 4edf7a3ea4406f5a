#![warn(missing_docs, missing_debug_implementations)]

//! Check whether a username exists on social and code-hosting platforms.
//!
//! A base username is expanded into its spelling variants (`john_doe`,
//! `johndoe`, `john.doe`, `john-doe`), and each variant is probed against
//! every registered platform with a single HTTP request. Each platform uses
//! its own heuristic to classify the response: the status code, a JSON field,
//! or markers in the profile HTML. A failed probe is reported as an error
//! verdict and never stops the scan.
//!
//! # Example
//!
//! ```no_run
//! use kosinter::check::{Client, Verdict};
//! use kosinter::platform;
//!
//! let client = Client::new();
//! let github = platform::find("github").unwrap();
//! match github.check(&client, "octocat").verdict {
//!     Verdict::Found { url } => println!("found at {url}"),
//!     Verdict::NotFound => println!("no such user"),
//!     Verdict::Error(e) => eprintln!("error: {e}"),
//! }
//! ```

pub mod check;
pub mod logging;
pub mod platform;
pub mod report;
pub mod scan;
pub mod session;
pub mod variants;
