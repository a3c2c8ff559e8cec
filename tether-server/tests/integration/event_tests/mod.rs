mod test_broadcast_excludes_sender;
