//! Page table entry for software emulation.

use crate::{PageFlags, PhysicalAddress};

/// A single 32-bit page table entry.
///
/// The layout mirrors a classic two-level x86 entry:
/// - Bits 0-11: Flags (present, writable, user)
/// - Bits 12-31: Physical frame address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct PageEntry(u32);

impl PageEntry {
    /// Physical address mask (bits 12-31).
    const ADDRESS_MASK: u32 = 0xFFFF_F000;

    /// Flag bits mask (bits 0-11).
    const FLAGS_MASK: u32 = 0x0000_0FFF;

    /// Creates a new page table entry.
    ///
    /// The physical address must be page-aligned and fit in 32 bits.
    pub fn new(address: PhysicalAddress, flags: PageFlags) -> Self {
        debug_assert!(
            address.as_usize() & !(Self::ADDRESS_MASK as usize) == 0,
            "physical address must be page-aligned and below 4 GiB"
        );

        let addr_bits = address.as_usize() as u32 & Self::ADDRESS_MASK;
        let flag_bits = flags.to_raw() as u32 & Self::FLAGS_MASK;
        Self(addr_bits | flag_bits)
    }

    /// Returns the physical address stored in this entry.
    ///
    /// Returns None if the entry is not present.
    pub fn address(self) -> Option<PhysicalAddress> {
        if self.is_present() {
            Some(PhysicalAddress::new((self.0 & Self::ADDRESS_MASK) as usize))
        } else {
            None
        }
    }

    /// Returns the flags for this entry.
    pub fn flags(self) -> PageFlags {
        PageFlags::from_raw((self.0 & Self::FLAGS_MASK) as usize)
    }

    /// Returns whether this entry is present (valid).
    pub fn is_present(self) -> bool {
        self.flags().is_present()
    }

    /// Clears this entry (sets it to zero).
    pub fn clear(&mut self) {
        self.0 = 0;
    }
}
