//! Address translation abstraction.
//!
//! Records of a virtual address space carry virtual addresses that have to be
//! moved into physical memory before they can be classified or compared. The
//! `AddressTranslator` trait hides where the mapping comes from so the
//! analyzer does not depend on a particular table format.

pub mod monolith;

/// The outcome of a successful translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Physical start address of the element.
    pub physical_start: u64,
    /// Name of the segment whose mapping was used.
    pub section_name: String,
}

/// A source of virtual to physical address mappings.
pub trait AddressTranslator {
    /// Translates the element `[virtual_start, virtual_start + max(size, 1) - 1]`.
    ///
    /// # Arguments
    /// * `virtual_start` - Start of the element in the virtual address space.
    /// * `size` - Size of the element; zero-sized elements occupy one address.
    /// * `allowed_sections` - Only mappings of these segments are considered.
    ///
    /// Returns `None` when no allowed segment contains the whole element.
    fn translate(
        &self,
        virtual_start: u64,
        size: u64,
        allowed_sections: &[String],
    ) -> Option<Translation>;
}
