mod test_early_candidates_are_buffered;
mod test_link_lifecycle;
