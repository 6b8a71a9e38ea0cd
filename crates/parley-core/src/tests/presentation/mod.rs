mod toast;
