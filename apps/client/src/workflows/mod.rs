// User-facing flows over the gateway. Each one catches failures at its
// boundary and converts them into notifications — nothing above these
// re-handles errors, there is no caller beyond the triggering action.

pub mod personalize;
pub mod profile;
pub mod submission;
