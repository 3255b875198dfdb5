mod poll_loop_tests;
