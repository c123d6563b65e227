mod catalog;
mod recommendation;
mod watch_record;

pub use catalog::{
    CandidateContent, CastMember, ContentDetails, Creator, Credits, CrewMember, Genre, GenreMap,
    MediaScope, TimeWindow,
};
pub use recommendation::{GenreWeights, Recommendation};
pub use watch_record::{
    lenient_rating, validate_rating, MediaKind, NewWatchRecord, WatchRecord, WatchStatus,
};
