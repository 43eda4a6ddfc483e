//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod call;
mod fault;
mod lookup;
mod message;
mod twiml;

pub use call::{
    TransportError as CallTransportError, decode_call_json_response, encode_place_call_form,
};
pub use fault::decode_api_fault;
pub use lookup::{decode_lookup_json_response, encode_lookup_url};
pub use message::{decode_message_json_response, encode_send_message_form};
