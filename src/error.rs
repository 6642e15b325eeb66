#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The listener registry is at capacity.
    ListenerTableFull,
    /// A test-only operation was invoked without the mock-modem flag.
    TestSurfaceNotAllowed,
}
