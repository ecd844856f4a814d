use std::process::ExitCode;

fn main() -> ExitCode {
    histmerge::lib_main()
}
