mod support;

mod status_transition_tests;
