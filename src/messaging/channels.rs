// Lock-free SPSC channels
//
// Events: game -> sequencer. Commands: sequencer -> sound emitter.
// Exactly one producer and one consumer per channel.

use crate::event::AudioMessage;
use crate::messaging::command::AudioCommand;
use ringbuf::{HeapRb, traits::Split};

pub type EventProducer = ringbuf::HeapProd<AudioMessage>;
pub type EventConsumer = ringbuf::HeapCons<AudioMessage>;

pub fn create_event_channel(capacity: usize) -> (EventProducer, EventConsumer) {
    let rb = HeapRb::<AudioMessage>::new(capacity);
    rb.split()
}

pub type CommandProducer = ringbuf::HeapProd<AudioCommand>;
pub type CommandConsumer = ringbuf::HeapCons<AudioCommand>;

pub fn create_command_channel(capacity: usize) -> (CommandProducer, CommandConsumer) {
    let rb = HeapRb::<AudioCommand>::new(capacity);
    rb.split()
}
