//! Frame layers for the kernel heap.
//!
//! The heap core is architecture-neutral. This module provides the [`FrameLayer`]
//! implementations it runs on: the x86_64 page tables on real hardware, and a software
//! emulation used by the tests and by hosted builds.
//!
//! [`FrameLayer`]: crate::FrameLayer

// NOTE: We include the hardware module even during tests so that rust-analyzer can see it.
#[cfg(target_arch = "x86_64")]
pub mod x86_64;

// Software emulation is only built for tests or when explicitly requested.
#[cfg(any(test, feature = "software-emulation"))]
pub mod software;
