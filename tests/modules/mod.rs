mod codec;
mod document;
mod wire;
