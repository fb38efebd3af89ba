pub mod seat;
pub mod venue;
pub mod selected;
pub mod relay;

pub use seat::{tier_price, Seat, SeatIdParts, SeatStatus};
pub use venue::{MapSize, Row, Section, SectionTransform, Venue};
pub use selected::SelectedSeat;
pub use relay::RelayMessage;
