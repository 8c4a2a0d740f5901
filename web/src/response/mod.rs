pub(crate) mod handshake;
