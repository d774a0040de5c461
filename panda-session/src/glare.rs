use panda_core::PeerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlareOutcome {
    /// Our id sorts lower: keep the pending offer, drop theirs.
    KeepLocalOffer,
    /// Their id sorts lower: discard our half-open connection and answer them.
    YieldToRemote,
}

/// Tie-break for two offers crossing on the channel.
///
/// Both sides evaluate the same comparison on the same pair of ids, so exactly
/// one of them yields.
pub fn resolve_glare(local: &PeerId, remote: &PeerId) -> GlareOutcome {
    if local < remote {
        GlareOutcome::KeepLocalOffer
    } else {
        GlareOutcome::YieldToRemote
    }
}
