mod test_relay_fallback;
