mod record_builder_tests;
