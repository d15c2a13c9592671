mod parser_type_tests;
