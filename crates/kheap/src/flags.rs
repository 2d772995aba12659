//! Permission flags requested when backing a heap page.

/// Page permission flags passed to [`FrameLayer::map`](crate::FrameLayer::map).
///
/// The bit positions follow the x86 page table entry layout so layers can translate
/// them with a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFlags(usize);

impl PageFlags {
    /// Present bit (bit 0).
    const PRESENT: usize = 1 << 0;

    /// Writable bit (bit 1).
    const WRITABLE: usize = 1 << 1;

    /// User-accessible bit (bit 2).
    const USER: usize = 1 << 2;

    /// No-execute bit (the top bit, bit 63 on 64-bit targets).
    const NO_EXECUTE: usize = 1 << (usize::BITS - 1);

    /// Creates empty page flags (page not present).
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Flags used for kernel heap pages: present, writable, supervisor-only, not executable.
    pub const fn kernel_data() -> Self {
        Self(Self::PRESENT | Self::WRITABLE | Self::NO_EXECUTE)
    }

    /// Creates page flags from a raw value.
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw value of these flags.
    pub const fn to_raw(self) -> usize {
        self.0
    }

    /// Returns whether the present bit is set.
    pub const fn is_present(self) -> bool {
        (self.0 & Self::PRESENT) != 0
    }

    /// Sets or clears the present bit.
    pub fn set_present(&mut self, present: bool) {
        self.set(Self::PRESENT, present);
    }

    /// Returns whether the writable bit is set.
    pub const fn is_writable(self) -> bool {
        (self.0 & Self::WRITABLE) != 0
    }

    /// Sets or clears the writable bit.
    pub fn set_writable(&mut self, writable: bool) {
        self.set(Self::WRITABLE, writable);
    }

    /// Returns whether the user-accessible bit is set.
    pub const fn is_user(self) -> bool {
        (self.0 & Self::USER) != 0
    }

    /// Sets or clears the user-accessible bit.
    pub fn set_user(&mut self, user: bool) {
        self.set(Self::USER, user);
    }

    /// Returns whether the no-execute bit is set.
    pub const fn is_no_execute(self) -> bool {
        (self.0 & Self::NO_EXECUTE) != 0
    }

    /// Sets or clears the no-execute bit.
    pub fn set_no_execute(&mut self, no_execute: bool) {
        self.set(Self::NO_EXECUTE, no_execute);
    }

    fn set(&mut self, bit: usize, value: bool) {
        if value {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}

impl Default for PageFlags {
    fn default() -> Self {
        Self::empty()
    }
}
