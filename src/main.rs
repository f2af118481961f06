use spectre::app::{self, Flags};

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    let flags = Flags {
        gallery_dir: args.opt_value_from_str("--gallery-dir").unwrap(),
        output_dir: args.opt_value_from_str("--output-dir").unwrap(),
        camera_index: args.opt_value_from_str("--camera").unwrap(),
    };

    app::run(flags)
}
