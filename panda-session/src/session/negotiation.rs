/// Offer/answer progress of the current connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Negotiation {
    /// No connection.
    #[default]
    Idle,
    /// We published an offer and nobody has answered it yet.
    HaveLocalOffer,
    /// A remote offer is applied; our answer is being produced.
    HaveRemoteOffer,
    /// Both descriptions are in place.
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationStep {
    LocalOffer,
    RemoteOffer,
    LocalAnswer,
    RemoteAnswer,
    Reset,
}

impl Negotiation {
    /// Total transition function. Steps that make no sense in the current
    /// state leave it unchanged.
    pub fn next(self, step: NegotiationStep) -> Negotiation {
        use Negotiation::*;
        use NegotiationStep::*;

        match (self, step) {
            (_, Reset) => Idle,
            (_, LocalOffer) => HaveLocalOffer,
            (_, RemoteOffer) => HaveRemoteOffer,
            (HaveRemoteOffer, LocalAnswer) => Stable,
            (HaveLocalOffer, RemoteAnswer) => Stable,
            (state, LocalAnswer | RemoteAnswer) => state,
        }
    }

    /// Local description is an offer and no remote description is set.
    pub fn is_unanswered_offer(self) -> bool {
        self == Negotiation::HaveLocalOffer
    }

    pub fn has_remote_description(self) -> bool {
        matches!(self, Negotiation::HaveRemoteOffer | Negotiation::Stable)
    }
}
