pub mod test_answer_ignored_when_not_offering;
pub mod test_glare_single_answer;
pub mod test_offer_restarts_stable_session;
