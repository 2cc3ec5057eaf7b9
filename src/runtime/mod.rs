mod channel;
mod edit;

pub use channel::{Channel, ChannelEvent, ChannelOptions, GraphEventHandle};
pub use edit::{EDIT_QUEUE_SIZE, EditBus, EditPublisher};
