mod repository;
mod tick;

pub use repository::TickMarkerRepository;
pub use tick::TickSlot;
